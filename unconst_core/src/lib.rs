//! `unconst_core` rewrites Jasmine-style spec files so that fixtures
//! declared as `const` in `describe` scope are recreated for every spec.
//!
//! Specs that share a `const` object share its mutations too, which only
//! goes unnoticed while specs run in a fixed order. The engine turns
//!
//! ```text
//! describe('FooService', () => {
//!   const fooService = jasmine.createSpyObj('FooService', ['bar']);
//!   fooService.bar.and.returnValue(of({ 'bar' }));
//!
//!   it('works', () => { ... });
//! ```
//!
//! into
//!
//! ```text
//! describe('FooService', () => {
//!   let fooService;
//!
//!   beforeEach(() => {
//!     fooService = jasmine.createSpyObj('FooService', ['bar']);
//!     fooService.bar.and.returnValue(of({ 'bar' }));
//!   });
//!
//!   it('works', () => { ... });
//! ```
//!
//! ## Processing Pipeline
//!
//! ```text
//! spec file lines
//!   → setup block discovery (find `beforeEach(`, or insert one before the first nested `describe(` / `it(`)
//!   → classifier (const declaration, let declaration, statement on a known name, plain line)
//!   → editor (records insert/replace/delete edits and offsets against the untouched source)
//!   → replay (builds the rewritten line sequence)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use unconst_core::Layout;
//! use unconst_core::rewrite_source;
//!
//! let source = "  const foo = 'foo';\n  beforeEach(() => {\n  });\n";
//! let rewrite = rewrite_source("foo.spec.ts", source, Layout::default()).unwrap();
//!
//! assert_eq!(
//! 	rewrite.content(),
//! 	"  let foo;\n  beforeEach(() => {\n    foo = 'foo';\n  });\n"
//! );
//! ```

pub use classify::*;
pub use construct::*;
pub use editor::*;
pub use engine::*;
pub use error::*;
pub use setup_block::*;

mod classify;
pub mod config;
mod construct;
mod editor;
mod engine;
#[allow(unused_assignments)]
mod error;
pub mod project;
mod setup_block;

#[cfg(test)]
mod __fixtures;
