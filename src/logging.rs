// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber. `SPENDWISE_LOG` overrides the default
/// filter; stdout is left for tables and JSON.
pub fn init(verbose: bool) {
    let default = if verbose {
        "spendwise=debug"
    } else {
        "spendwise=info"
    };
    let filter = EnvFilter::try_from_env("SPENDWISE_LOG").unwrap_or_else(|_| default.into());
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}
