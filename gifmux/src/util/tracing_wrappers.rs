// Copyright (c) the gifmux Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

#[cfg(feature = "tracing")]
#[allow(unused_imports)]
pub(crate) use tracing::{debug, trace, warn};

// Arguments are still type-checked so that call sites compile identically with and without the
// `tracing` feature. The macros carry a prefix because a `macro_rules! warn` would be ambiguous
// with the built-in `#[warn]` attribute.
#[cfg(not(feature = "tracing"))]
mod noop {
    macro_rules! noop_debug {
        ($($arg:tt)*) => {{
            if false {
                let _ = format_args!($($arg)*);
            }
        }};
    }
    macro_rules! noop_trace {
        ($($arg:tt)*) => {{
            if false {
                let _ = format_args!($($arg)*);
            }
        }};
    }
    macro_rules! noop_warn {
        ($($arg:tt)*) => {{
            if false {
                let _ = format_args!($($arg)*);
            }
        }};
    }
    pub(crate) use {noop_debug, noop_trace, noop_warn};
}

#[cfg(not(feature = "tracing"))]
#[allow(unused_imports)]
pub(crate) use noop::{noop_debug as debug, noop_trace as trace, noop_warn as warn};
