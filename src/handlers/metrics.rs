// Liveness counter for scrapers, always the same two lines
pub const METRICS_BODY: &str = "# TYPE isupdummy counter\nisupdummy 1\n";

pub async fn metrics_handler() -> &'static str {
    METRICS_BODY
}
