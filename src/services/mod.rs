//! Business logic services.

mod forecast;

pub use forecast::ForecastService;
