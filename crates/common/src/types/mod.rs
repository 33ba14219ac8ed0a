use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Body returned by a successful delete.
#[derive(Serialize, Debug)]
pub struct Message {
    pub message: &'static str,
}
