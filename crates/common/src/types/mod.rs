use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// One-shot success notice returned alongside a redirect to the listing.
#[derive(Serialize, Debug, Clone)]
pub struct Flash<T> {
    pub message: String,
    pub data: T,
}

impl<T> Flash<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self { message: message.into(), data }
    }
}
