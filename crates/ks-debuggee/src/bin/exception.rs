//! `exception`: error-propagation debuggee.
//!
//! Recognizes `-CallRaisedHandledException`, `-CallRaisedUnhandledException`
//! and `-CallRaisedReThrowException`; anything else is ignored. The
//! unhandled path never reaches "Finish testing".

use ks_debuggee::{debuggee_args, init_logging};
use ks_features::exception::{eval, raise_and_rethrow, raise_handled, raise_unhandled, recursive_func};
use std::hint::black_box;

const HANDLED: &str = "-CallRaisedHandledException";
const UNHANDLED: &str = "-CallRaisedUnhandledException";
const RETHROW: &str = "-CallRaisedReThrowException";

fn main() {
    init_logging();

    let args = debuggee_args();
    let enabled = |flag: &str| args.iter().any(|a| a == flag);

    println!("Start testing");

    let my_var1 = 100;
    let my_var2 = 200;
    let my_sum = my_var1 + my_var2;
    let depth = recursive_func(my_sum);
    tracing::debug!(depth, "recursion finished");

    if enabled(HANDLED) {
        let result = raise_handled(my_var1);
        tracing::debug!(result, "handled error");
    }

    if enabled(UNHANDLED) {
        black_box(raise_unhandled(my_var2));
    }

    black_box(eval(my_var1, my_var2));

    if enabled(RETHROW) {
        raise_and_rethrow();
    }

    println!("Finish testing");
}
