use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Fetch(#[from] dsprep_fetch::FetchError),

    #[error(transparent)]
    Archive(#[from] dsprep_archive::Error),

    #[error(transparent)]
    Fs(#[from] dsprep_fs::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
