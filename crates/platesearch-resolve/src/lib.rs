//! platesearch-resolve
//!
//! [`NameResolver`](platesearch_core::traits::NameResolver) implementations:
//! the CDS Sesame web service and a fixed name table.
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use platesearch_core::config::{ResolverConfig, ResolverKind};
use platesearch_core::traits::NameResolver;

pub mod sesame;
pub mod table;

pub use sesame::SesameResolver;
pub use table::StaticResolver;

/// Build the resolver selected by `config.kind`.
pub fn from_config(config: &ResolverConfig) -> Result<Arc<dyn NameResolver>> {
    match config.kind {
        ResolverKind::Sesame => {
            info!(url = %config.sesame_url, "using Sesame name resolver");
            let resolver = SesameResolver::new(&config.sesame_url, Duration::from_secs(config.timeout_secs))?;
            Ok(Arc::new(resolver))
        }
        ResolverKind::Static => {
            let resolver = StaticResolver::new(&config.objects);
            if resolver.is_empty() {
                warn!("static name resolver has no objects; every object search will come back empty");
            } else {
                info!(objects = resolver.len(), "using static name resolver");
            }
            Ok(Arc::new(resolver))
        }
    }
}
