//! Error propagation across call depths
//!
//! Raising is returning `Err(ErrorRecord)`; catching is matching on it at the
//! designated handler. A rethrow raises a new record whose code is derived
//! from the caught one. Every step is recorded in an [`ErrorTrace`] so the
//! chain can be checked against [`ErrorState`].
//!
//! [`raise_unhandled`] is different: it divides by zero and panics. Nothing
//! here catches it.

use ks_harness::log_line;
use ks_harness::state_machine::validate_history;
use ks_harness::{ErrorRecord, ErrorState, Feature, FeatureError, HarnessConfig, Logger, StateMachineError};
use std::hint::black_box;

/// Code raised at the bottom of the rethrow chain
pub const INNER_CODE: i32 = 200;

/// Raise/catch steps taken by one entry point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorTrace {
    states: Vec<ErrorState>,
    caught: Vec<i32>,
}

impl Default for ErrorTrace {
    fn default() -> Self {
        Self {
            states: vec![ErrorState::NoError],
            caught: Vec::new(),
        }
    }
}

impl ErrorTrace {
    /// States visited, starting at `NoError`
    #[must_use]
    pub fn states(&self) -> &[ErrorState] {
        &self.states
    }

    /// Codes read by handlers, innermost first
    #[must_use]
    pub fn caught_codes(&self) -> &[i32] {
        &self.caught
    }

    /// Completed raise/catch cycles
    #[must_use]
    pub fn cycles(&self) -> usize {
        self.caught.len()
    }

    /// Check the recorded states against the error state machine.
    ///
    /// # Errors
    /// The first illegal step.
    pub fn validate(&self) -> Result<(), StateMachineError> {
        validate_history(&self.states)
    }

    fn raise(&mut self, code: i32) -> ErrorRecord {
        self.states.push(ErrorState::Raised);
        ErrorRecord::new(code)
    }

    fn catch(&mut self, record: ErrorRecord) -> i32 {
        self.states.push(ErrorState::Caught);
        self.caught.push(record.code());
        record.code()
    }

    fn rethrow(&mut self, code: i32) -> ErrorRecord {
        self.states.push(ErrorState::Rethrown);
        self.raise(code)
    }
}

/// Combining function used for the rethrown code
#[inline(never)]
#[must_use]
pub fn eval(var1: i32, var2: i32) -> i32 {
    var1 + var2
}

/// Recurses down to zero. Non-positive input is the base case.
#[inline(never)]
#[must_use]
pub fn recursive_func(a: i32) -> i32 {
    if a <= 0 {
        1
    } else {
        recursive_func(black_box(a - 1))
    }
}

/// Divides by a denominator that reaches zero. Never returns.
///
/// # Panics
/// Always, with "attempt to divide by zero".
#[inline(never)]
pub fn raise_unhandled(myvar: i32) -> i32 {
    let mut result = 10;
    let mut temp = black_box(-1);
    temp += 1;
    tracing::trace!(myvar, temp, "dividing");
    let myvar = result / temp;
    result = eval(myvar, myvar);
    result += 1;
    result
}

/// Raises and catches its own error; returns `a + 101`.
#[must_use]
pub fn raise_handled(a: i32) -> i32 {
    raise_handled_traced(a, &mut ErrorTrace::default())
}

/// [`raise_handled`], recording into `trace`.
#[inline(never)]
pub fn raise_handled_traced(a: i32, trace: &mut ErrorTrace) -> i32 {
    let mut global = 100;
    let mut result = 0;

    global += 1;
    let _ = recursive_func(global);
    let outcome = if result == 0 {
        Err(trace.raise(global))
    } else {
        // Unreachable with result fixed at 0
        Ok(global / result)
    };

    match outcome {
        Ok(value) => result = value,
        Err(record) => {
            result = a + global;
            let code = trace.catch(record);
            global += 1;
            tracing::trace!(code, global, "handled error");
        }
    }
    result
}

/// Two nested raise/catch cycles; nothing escapes to the caller.
pub fn raise_and_rethrow() {
    raise_and_rethrow_traced(&mut ErrorTrace::default());
}

/// [`raise_and_rethrow`], recording into `trace`.
#[inline(never)]
pub fn raise_and_rethrow_traced(trace: &mut ErrorTrace) {
    let mut var = 100;
    match rethrow_layer(&mut var, trace) {
        Ok(()) => {}
        Err(second) => {
            let code = trace.catch(second);
            var = 0;
            tracing::trace!(code, var, "outer handler");
        }
    }
}

#[inline(never)]
fn throw_new_error(trace: &mut ErrorTrace) -> Result<(), ErrorRecord> {
    Err(trace.raise(INNER_CODE))
}

#[inline(never)]
fn rethrow_layer(var: &mut i32, trace: &mut ErrorTrace) -> Result<(), ErrorRecord> {
    *var -= 100;
    if *var == 0 {
        if let Err(first) = throw_new_error(trace) {
            let code = trace.catch(first);
            *var = eval(code, code);
            return Err(trace.rethrow(*var));
        }
    }
    Ok(())
}

/// The Exception feature: handled raise, then the rethrow chain
#[derive(Debug, Default, Clone, Copy)]
pub struct ExceptionFeature;

impl ExceptionFeature {
    /// Registry constructor
    #[must_use]
    pub fn boxed(_config: &HarnessConfig) -> Box<dyn Feature> {
        Box::new(Self)
    }
}

impl Feature for ExceptionFeature {
    fn name(&self) -> &'static str {
        "Exception"
    }

    fn core_run(&mut self, log: &Logger) -> Result<(), FeatureError> {
        log_line!(log, "Raising handled error.");
        let mut trace = ErrorTrace::default();
        let result = raise_handled_traced(100, &mut trace);
        log_line!(log, "Handled result: ", result);

        log_line!(log, "Raising and rethrowing.");
        let mut trace = ErrorTrace::default();
        raise_and_rethrow_traced(&mut trace);
        trace.validate()?;
        log_line!(log, "Rethrow chain caught ", trace.cycles(), " errors.");
        Ok(())
    }
}

/// The UnhandledException feature: a fatal division by zero
#[derive(Debug, Default, Clone, Copy)]
pub struct UnhandledExceptionFeature;

impl UnhandledExceptionFeature {
    /// Registry constructor
    #[must_use]
    pub fn boxed(_config: &HarnessConfig) -> Box<dyn Feature> {
        Box::new(Self)
    }
}

impl Feature for UnhandledExceptionFeature {
    fn name(&self) -> &'static str {
        "UnhandledException"
    }

    fn core_run(&mut self, log: &Logger) -> Result<(), FeatureError> {
        log_line!(log, "Raising unhandled fault.");
        let result = raise_unhandled(200);
        log_line!(log, "Unreachable result: ", result);
        Ok(())
    }
}
