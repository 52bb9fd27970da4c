use env_logger::Env;

pub fn init(level: Option<&str>) {
    let default = level.unwrap_or("info");
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or(default))
        .format_timestamp_millis()
        .try_init();
}

/// Approximate resident size of `count` values of `T`, in megabytes.
pub fn approx_mb<T>(count: usize) -> f64 {
    (count * std::mem::size_of::<T>()) as f64 / 1024.0 / 1024.0
}
