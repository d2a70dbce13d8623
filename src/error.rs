use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid plot bounds: width={width}, height={height}")]
    InvalidPlotBounds { width: f64, height: f64 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid dayobs: {0}")]
    InvalidDayObs(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
