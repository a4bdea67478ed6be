//! Frames full of locals for expression evaluation
//!
//! Each `check_*` function holds a different kind of local and calls the next,
//! so a debugger stopped at the bottom sees the whole chain on the stack.
//! Locals are passed through `black_box` to keep them alive in optimized
//! builds.

use ks_harness::log_line;
use ks_harness::{Feature, FeatureError, HarnessConfig, Logger};
use std::hint::black_box;

/// A plain struct placed on the stack and on the heap
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Student {
    /// Name
    pub name: String,
    /// Age in years
    pub age: u32,
}

/// Larger of two values; `x` wins ties.
#[must_use]
pub fn max<T: PartialOrd>(x: T, y: T) -> T {
    if x >= y {
        x
    } else {
        y
    }
}

/// `x + (x - 1) + ... + 2 + 1`; anything at or below one is one.
#[inline(never)]
#[must_use]
pub fn accumulate(x: i32) -> i32 {
    if x <= 1 {
        return 1;
    }
    x + accumulate(x - 1)
}

#[inline(never)]
fn func() -> i32 {
    let is_called = black_box(true);
    let d = black_box(10.10_f64);
    tracing::trace!(is_called, d, "callback");
    accumulate(3)
}

#[inline(never)]
fn check_primitive_types() -> i32 {
    let mybool = black_box(true);
    let mychar = black_box('A');
    let myint = black_box(100_i32);
    let myfloat = black_box(299.0_f32);
    let mydouble = black_box(321.00_f64);
    let mywchar = black_box('z');
    black_box((mybool, mychar, myint, myfloat, mydouble, mywchar));

    let _ = black_box(max(myint, 42));
    let _ = black_box(max(mydouble, 0.5));
    check_array_and_pointers()
}

#[inline(never)]
fn check_array_and_pointers() -> i32 {
    let arr = black_box([0, 1, 2, 3, 4]);
    let p_arr: &[i32] = &arr;
    black_box(p_arr);
    check_struct_on_stack_and_heap()
}

#[inline(never)]
fn check_struct_on_stack_and_heap() -> i32 {
    let student = black_box(Student {
        name: "John".to_string(),
        age: 10,
    });

    let mut p_stu = Some(Box::new(Student {
        name: "Bob".to_string(),
        age: 9,
    }));
    black_box(&p_stu);
    p_stu = None;
    black_box((&student, p_stu));
    check_special_values()
}

#[inline(never)]
fn check_special_values() -> i32 {
    let mynull = black_box('\0');
    let zero = black_box(0.0_f64);
    let mut mydouble = black_box(1.0_f64);
    mydouble /= zero;
    black_box((mynull, mydouble));
    check_pretty_printing()
}

#[inline(never)]
fn check_pretty_printing() -> i32 {
    let text = black_box(String::from("hello, world"));
    let vec: Vec<i32> = (0..5).collect();
    black_box((&text, &vec));
    check_call_stack(func)
}

#[inline(never)]
fn check_call_stack(callback: fn() -> i32) -> i32 {
    let f = black_box(1.0_f32);
    black_box(f);
    callback()
}

/// The Expression feature
#[derive(Debug, Default, Clone, Copy)]
pub struct ExpressionFeature;

impl ExpressionFeature {
    /// Registry constructor
    #[must_use]
    pub fn boxed(_config: &HarnessConfig) -> Box<dyn Feature> {
        Box::new(Self)
    }

    /// Walk the whole chain; returns what the callback accumulated.
    #[must_use]
    pub fn evaluate(&self) -> i32 {
        check_primitive_types()
    }
}

impl Feature for ExpressionFeature {
    fn name(&self) -> &'static str {
        "Expression"
    }

    fn core_run(&mut self, log: &Logger) -> Result<(), FeatureError> {
        let accumulated = self.evaluate();
        log_line!(log, "Accumulated: ", accumulated);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulate_sums_down_to_one() {
        assert_eq!(accumulate(3), 6);
        assert_eq!(accumulate(1), 1);
        assert_eq!(accumulate(-4), 1);
    }

    #[test]
    fn max_prefers_first_on_tie() {
        assert_eq!(max(3, 7), 7);
        assert_eq!(max(2.5, -1.0), 2.5);
        assert_eq!(max(4, 4), 4);
    }

    #[test]
    fn chain_ends_in_callback() {
        assert_eq!(ExpressionFeature.evaluate(), 6);
    }
}
