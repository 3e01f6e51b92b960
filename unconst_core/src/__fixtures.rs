use crate::Layout;
use crate::UnconstResult;
use crate::rewrite_lines;

/// Owned lines from string literals.
pub fn lines(input: &[&str]) -> Vec<String> {
	input.iter().map(ToString::to_string).collect()
}

/// Rewrite `input` with the default layout and return the output lines.
pub fn rewrite(input: &[&str]) -> UnconstResult<Vec<String>> {
	Ok(rewrite_lines("test", &lines(input), Layout::default())?.lines)
}

pub const SPY_SPEC: &str = "\
import { of } from 'rxjs';

describe('FooComponent', () => {
  const fooService = jasmine.createSpyObj('FooService', ['bar']);
  fooService.bar.and.returnValue(
    of({ 'bar': 1 }));
  const options: FooOptions = { retries: 3 };
  let component: FooComponent;

  beforeEach(() => {
    component = new FooComponent(fooService, options);
  });

  it('loads bar', () => {
    const result = component.load();
    expect(result).toBeTruthy();
  });
});
";

pub const SPY_SPEC_REWRITTEN: &str = "\
import { of } from 'rxjs';

describe('FooComponent', () => {
  let fooService;
  let options: FooOptions;
  let component: FooComponent;

  beforeEach(() => {
    fooService = jasmine.createSpyObj('FooService', ['bar']);
    fooService.bar.and.returnValue(
      of({ 'bar': 1 }));
    options = { retries: 3 };
    component = new FooComponent(fooService, options);
  });

  it('loads bar', () => {
    const result = component.load();
    expect(result).toBeTruthy();
  });
});
";

pub const NESTED_SPEC: &str = "\
describe('Outer', () => {
  const mockTask = {
    check() {
      return of(data);
    }
  };

  describe('inner', () => {
    it('works', () => {});
  });
});
";

pub const NESTED_SPEC_REWRITTEN: &str = "\
describe('Outer', () => {
  let mockTask;

  beforeEach(() => {
    mockTask = {
      check() {
        return of(data);
      }
    };
  });

  describe('inner', () => {
    it('works', () => {});
  });
});
";
