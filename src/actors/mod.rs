#[cfg(test)]
mod tests;
mod user_actor;

pub use user_actor::UserActor;
