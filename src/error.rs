use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("dataset is empty")]
    EmptyDataset,

    #[error("unknown data channel `{0}`")]
    UnknownChannel(String),

    #[error("window change published while another change is being delivered")]
    ReentrantPublish,

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
