pub mod lineup;
