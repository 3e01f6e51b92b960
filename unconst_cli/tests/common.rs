#![allow(dead_code)]

use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub const SPEC: &str = "\
describe('FooComponent', () => {
  const fooService = jasmine.createSpyObj('FooService', ['bar']);
  fooService.bar.and.returnValue(of(1));

  beforeEach(() => {
    TestBed.configureTestingModule({});
  });

  it('works', () => {});
});
";

pub const SPEC_REWRITTEN: &str = "\
describe('FooComponent', () => {
  let fooService;

  beforeEach(() => {
    fooService = jasmine.createSpyObj('FooService', ['bar']);
    fooService.bar.and.returnValue(of(1));
    TestBed.configureTestingModule({});
  });

  it('works', () => {});
});
";

pub const SPEC_WITHOUT_SETUP: &str = "\
describe('Bar', () => {
  const bar = { count: 0 };

  it('counts', () => {
    bar.count++;
  });
});
";

pub const SPEC_WITHOUT_SETUP_REWRITTEN: &str = "\
describe('Bar', () => {
  let bar;

  beforeEach(() => {
    bar = { count: 0 };
  });

  it('counts', () => {
    bar.count++;
  });
});
";

pub fn unconst_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("unconst"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("RUST_LOG");
	cmd
}
