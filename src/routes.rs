use crate::{api::attendance, config::Config};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;

/// Helper to build a per-scope limiter
fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let per_ms = if requests_per_min == 0 {
        1
    } else {
        (60_000 / requests_per_min as u64).max(1)
    };
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min.max(1))
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .expect("per_millisecond and burst_size are non-zero");
    Governor::new(&cfg)
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    let api_limiter = build_limiter(config.rate_api_per_min);

    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(api_limiter) // rate limiting
            .service(
                web::scope("/attendance")
                    // /attendance/daily-status/run
                    .service(
                        web::resource("/daily-status/run")
                            .route(web::post().to(attendance::run_daily_status)),
                    )
                    // /attendance/{user_id}/check-in
                    .service(
                        web::resource("/{user_id}/check-in")
                            .route(web::post().to(attendance::check_in)),
                    )
                    // /attendance/{user_id}/check-out
                    .service(
                        web::resource("/{user_id}/check-out")
                            .route(web::post().to(attendance::check_out)),
                    )
                    // /attendance/{user_id}/status
                    .service(
                        web::resource("/{user_id}/status")
                            .route(web::get().to(attendance::day_status)),
                    ),
            ),
    );
}
