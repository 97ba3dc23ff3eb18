use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("deferred call to `{callable}` already consumed a single-use callable or argument")]
    Spent { callable: &'static str },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
