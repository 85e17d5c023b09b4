// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Console logging setup.
//!
//! Progress goes to stdout, warnings and errors to stderr.

use tracing::Level;
use tracing_subscriber::fmt::writer::{MakeWriterExt, OrElse, WithMaxLevel};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

/// Route WARN and ERROR events to `err`, everything else to `out`.
pub fn split_writer<O, E>(out: O, err: E) -> OrElse<WithMaxLevel<E>, O>
where
    O: for<'a> MakeWriter<'a>,
    E: for<'a> MakeWriter<'a>,
{
    err.with_max_level(Level::WARN).or_else(out)
}

/// Initialize logging: human-readable by default, JSON when LOG_FORMAT=json.
pub fn init_logging() {
    let json = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    let writer = split_writer(std::io::stdout, std::io::stderr);

    let format = if json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(false)
            .with_current_span(true)
            .flatten_event(true)
            .with_writer(writer)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(writer)
            .boxed()
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("firestore_backup=debug,info"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
