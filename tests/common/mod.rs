#![allow(dead_code, unused_imports)]

pub use procward_test_utils::builders;
pub use procward_test_utils::fake_process;
pub use procward_test_utils::triggers;
pub use procward_test_utils::{init_tracing, with_timeout};
