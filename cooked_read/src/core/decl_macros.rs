// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// Shorthand for `Ok(())` or `Ok($value)`.
///
/// ```
/// # use r3bl_cooked_read::ok;
/// fn unit() -> Result<(), ()> { ok!() }
/// fn value() -> Result<u8, ()> { ok!(42) }
/// # assert_eq!(unit(), Ok(()));
/// # assert_eq!(value(), Ok(42));
/// ```
#[macro_export]
macro_rules! ok {
    // No args.
    () => {
        Ok(())
    };
    // With arg.
    ($value:expr) => {
        Ok($value)
    };
}

/// A wrapper for `pretty_assertions::assert_eq!` macro.
#[macro_export]
macro_rules! assert_eq2 {
    ($($params:tt)*) => {
        pretty_assertions::assert_eq!($($params)*)
    };
}

/// Format into an [`crate::InlineString`] without touching the heap for short results.
///
/// ```
/// # use r3bl_cooked_read::inline_string;
/// let it = inline_string!("{}: {}", 12, "dir");
/// assert_eq!(it.as_str(), "12: dir");
/// ```
#[macro_export]
macro_rules! inline_string {
    ($($format:tt)*) => {{
        let mut acc = $crate::InlineString::new();
        // Writing into an in-memory buffer can't fail.
        _ = std::fmt::Write::write_fmt(&mut acc, format_args!($($format)*));
        acc
    }};
}
