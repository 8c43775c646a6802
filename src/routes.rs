use crate::{api::attendance, config::Config};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;
use anyhow::{Result, anyhow};
use std::sync::Arc;

// Helper to build per-route limiter
fn build_limiter(requests_per_min: u32) -> Result<Governor<PeerIpKeyExtractor, NoOpMiddleware>> {
    let per_ms = if requests_per_min == 0 {
        1
    } else {
        60_000 / requests_per_min as u64
    };
    let cfg = GovernorConfigBuilder::default()
        .milliseconds_per_request(per_ms.max(1))
        .burst_size(requests_per_min.max(1))
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .ok_or_else(|| anyhow!("invalid rate limit: {requests_per_min} per minute"))?;
    Ok(Governor::new(&cfg))
}

/// Limiters are built once at startup and shared by every worker.
#[derive(Clone)]
pub struct Limiters {
    check_in: Arc<Governor<PeerIpKeyExtractor, NoOpMiddleware>>,
    lookup: Arc<Governor<PeerIpKeyExtractor, NoOpMiddleware>>,
}

impl Limiters {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            check_in: Arc::new(build_limiter(config.rate_check_in_per_min)?),
            lookup: Arc::new(build_limiter(config.rate_lookup_per_min)?),
        })
    }
}

pub fn configure(cfg: &mut web::ServiceConfig, api_prefix: &str, limiters: Limiters) {
    cfg.service(
        web::scope(api_prefix).service(
            web::scope("/attendance")
                .app_data(attendance::json_config())
                // /attendance
                .service(
                    web::resource("")
                        .wrap(limiters.check_in.clone())
                        .route(web::post().to(attendance::check_in)),
                )
                // /attendance/student/{student_id}
                .service(
                    web::resource("/student/{student_id}")
                        .wrap(limiters.lookup.clone())
                        .route(web::get().to(attendance::latest_for_student)),
                ),
        ),
    );
}
