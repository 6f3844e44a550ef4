pub mod like_snapshot;
