use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("failed to render chart: {0}")]
    Draw(String),
    #[error("pixel buffer does not match a {width}x{height} image")]
    Buffer { width: u32, height: u32 },
    #[error("failed to encode PNG")]
    Encode(#[from] image::ImageError),
    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for ChartError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        ChartError::Draw(format!("{value:?}"))
    }
}
