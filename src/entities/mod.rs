pub mod events;
pub mod locations;
pub mod submissions;
pub mod votes;

pub use events as event_entity;
pub use locations as location_entity;
pub use submissions as submission_entity;
pub use votes as vote_entity;
