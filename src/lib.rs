pub mod api;
pub mod chart;
pub mod chart_svg;
pub mod chart_tui;
pub mod config;
pub mod export;
pub mod feed;
pub mod http_cache;
pub mod http_client;
pub mod logging;
pub mod performance;
pub mod sample_scores;
pub mod scores;
pub mod scores_view;
pub mod series;
pub mod state;
pub mod visibility;
