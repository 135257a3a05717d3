//! Tracing macros
//!
//! Kernel-style macros emitting through the instance registered with
//! [`install`](super::install). Each one checks the source level first, so
//! the arguments of a filtered message are never formatted.
//!
//! # Usage
//!
//! ```rust,ignore
//! use trace_core::trace::Source;
//!
//! tr_info!(Source::BLE, "connected to {:02x?}", peer);
//! tr_enter!(Source::MAIN, "len {}", len);
//! tr_hex!(Level::Debug, Source::BLE, &pdu);
//! ```
//!
//! # Macro List
//!
//! - `tr_chatty!` / `tr_debug!` / `tr_info!` / `tr_warn!` / `tr_error!` /
//!   `tr_fatal!` - located message: `component[line] function() L text`
//! - `tr_short!` - leveled message without location
//! - `tr_enter!` / `tr_leave!` - function entry and exit markers
//! - `tr_hex!` - hex dump, one short message per 16 bytes
//! - `tr_print!` - raw formatted output, no header, no level
//!
//! Every macro evaluates to the number of bytes queued, 0 when nothing was
//! emitted (no instance, filtered, dropped).

/// Last path segment of a module path, used as the location tag
#[doc(hidden)]
pub fn short_module(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}

/// Turns the type name of a nested item into the enclosing function name
#[doc(hidden)]
pub fn short_function(type_name: &str) -> &str {
    let mut name = type_name.strip_suffix("::f").unwrap_or(type_name);
    while let Some(outer) = name.strip_suffix("::{{closure}}") {
        name = outer;
    }
    short_module(name)
}

#[doc(hidden)]
#[macro_export]
macro_rules! __trace_function {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::core::any::type_name::<T>()
        }
        $crate::trace::macros::short_function(type_name_of(f))
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __trace_site {
    () => {
        $crate::trace::CallSite::new(
            $crate::trace::macros::short_module(::core::module_path!()),
            ::core::line!(),
            ::core::option::Option::Some($crate::__trace_function!()),
        )
    };
}

/// Internal implementation macro of the located, leveled messages
#[doc(hidden)]
#[macro_export]
macro_rules! __trace_located {
    ($level:expr, $source:expr, $($arg:tt)+) => {
        match $crate::trace::global() {
            ::core::option::Option::Some(tracer)
                if $crate::trace::Tracer::is_traceable(tracer, $source, $level) =>
            {
                let site = $crate::__trace_site!();
                $crate::trace::Tracer::printf_leveled(
                    tracer,
                    $level,
                    $source,
                    ::core::option::Option::Some(&site),
                    format_args!("{}\n", format_args!($($arg)+)),
                )
            }
            _ => 0,
        }
    };
}

/// Emits a CHATTY message
#[macro_export]
macro_rules! tr_chatty {
    ($source:expr, $($arg:tt)+) => {
        $crate::__trace_located!($crate::trace::Level::Chatty, $source, $($arg)+)
    };
}

/// Emits a DEBUG message
#[macro_export]
macro_rules! tr_debug {
    ($source:expr, $($arg:tt)+) => {
        $crate::__trace_located!($crate::trace::Level::Debug, $source, $($arg)+)
    };
}

/// Emits an INFO message
#[macro_export]
macro_rules! tr_info {
    ($source:expr, $($arg:tt)+) => {
        $crate::__trace_located!($crate::trace::Level::Info, $source, $($arg)+)
    };
}

/// Emits a WARN message
#[macro_export]
macro_rules! tr_warn {
    ($source:expr, $($arg:tt)+) => {
        $crate::__trace_located!($crate::trace::Level::Warn, $source, $($arg)+)
    };
}

/// Emits an ERROR message
#[macro_export]
macro_rules! tr_error {
    ($source:expr, $($arg:tt)+) => {
        $crate::__trace_located!($crate::trace::Level::Error, $source, $($arg)+)
    };
}

/// Emits a FATAL-level message through the queue
///
/// This is still a regular queued message; the blocking last-resort output
/// is [`TraceSubsystem::fatal`](crate::trace::TraceSubsystem::fatal).
#[macro_export]
macro_rules! tr_fatal {
    ($source:expr, $($arg:tt)+) => {
        $crate::__trace_located!($crate::trace::Level::Fatal, $source, $($arg)+)
    };
}

/// Emits a leveled message without location nor function name
///
/// # Examples
///
/// ```rust,ignore
/// tr_short!(Level::Info, Source::SYS, "vbat {} mV", mv);
/// ```
#[macro_export]
macro_rules! tr_short {
    ($level:expr, $source:expr, $($arg:tt)+) => {
        match $crate::trace::global() {
            ::core::option::Option::Some(tracer)
                if $crate::trace::Tracer::is_traceable(tracer, $source, $level) =>
            {
                $crate::trace::Tracer::printf_leveled(
                    tracer,
                    $level,
                    $source,
                    ::core::option::Option::None,
                    format_args!("{}\n", format_args!($($arg)+)),
                )
            }
            _ => 0,
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __trace_func {
    ($prefix:literal, $source:expr, $($arg:tt)*) => {
        match $crate::trace::global() {
            ::core::option::Option::Some(tracer)
                if $crate::trace::Tracer::is_func_traceable(tracer, $source) =>
            {
                let site = $crate::__trace_site!();
                $crate::trace::Tracer::printf_leveled(
                    tracer,
                    $crate::trace::Level::Func,
                    $source,
                    ::core::option::Option::Some(&site),
                    format_args!(concat!($prefix, "{}\n"), format_args!($($arg)*)),
                )
            }
            _ => 0,
        }
    };
}

/// Marks the entry of the current function: `> `
#[macro_export]
macro_rules! tr_enter {
    ($source:expr) => {
        $crate::__trace_func!("> ", $source, "")
    };
    ($source:expr, $($arg:tt)+) => {
        $crate::__trace_func!("> ", $source, $($arg)+)
    };
}

/// Marks the exit of the current function: `< `
#[macro_export]
macro_rules! tr_leave {
    ($source:expr) => {
        $crate::__trace_func!("< ", $source, "")
    };
    ($source:expr, $($arg:tt)+) => {
        $crate::__trace_func!("< ", $source, $($arg)+)
    };
}

/// Dumps a byte slice as hex
#[macro_export]
macro_rules! tr_hex {
    ($level:expr, $source:expr, $data:expr) => {
        match $crate::trace::global() {
            ::core::option::Option::Some(tracer) => {
                $crate::trace::Tracer::trace_hex(tracer, $level, $source, $data)
            }
            ::core::option::Option::None => 0,
        }
    };
}

/// Raw formatted output, not filtered by level
#[macro_export]
macro_rules! tr_print {
    ($($arg:tt)+) => {
        match $crate::trace::global() {
            ::core::option::Option::Some(tracer) => {
                $crate::trace::Tracer::printf(tracer, format_args!($($arg)+))
            }
            ::core::option::Option::None => 0,
        }
    };
}
