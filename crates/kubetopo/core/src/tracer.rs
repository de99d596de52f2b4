use std::{env, ffi::OsStr, io};

use tracing::{dispatcher, Subscriber};
use tracing_subscriber::{
    layer::SubscriberExt, registry::LookupSpan, util::SubscriberInitExt, Layer, Registry,
};

fn init_once_registry() {
    // Skip init if has been set
    if dispatcher::has_been_set() {
        return;
    }

    fn init_layer_env_filter<S>() -> impl Layer<S>
    where
        S: Subscriber + for<'span> LookupSpan<'span>,
    {
        ::tracing_subscriber::EnvFilter::from_default_env()
    }

    // stdout is reserved for the rendered graphs
    fn init_layer_stdfmt<S>() -> impl Layer<S>
    where
        S: Subscriber + for<'span> LookupSpan<'span>,
    {
        ::tracing_subscriber::fmt::layer().with_writer(io::stderr)
    }

    Registry::default()
        .with(init_layer_env_filter())
        .with(init_layer_stdfmt())
        .init()
}

pub fn init_once() {
    // Skip init if has been set
    if dispatcher::has_been_set() {
        return;
    }

    // set default tracing level
    if env::var_os(KEY).is_none() {
        env::set_var(KEY, "INFO");
    }

    init_once_registry()
}

pub fn init_once_with(level: impl AsRef<OsStr>) {
    // Skip init if has been set
    if dispatcher::has_been_set() {
        return;
    }

    // set custom tracing level
    env::set_var(KEY, level);

    init_once_registry()
}

/// Maps the number of `--debug` flags to a tracing level.
///
/// Without any flag an explicit `RUST_LOG` wins over the default `WARN`.
pub fn init_once_with_level_int(level: u8) {
    if level == 0 && env::var_os(KEY).is_some() {
        return init_once_registry();
    }
    init_once_with(debug_level(level))
}

fn debug_level(level: u8) -> &'static str {
    match level {
        0 => "WARN",
        1 => "INFO",
        2 => "DEBUG",
        _ => "TRACE",
    }
}

const KEY: &str = "RUST_LOG";
