pub mod activity;
pub mod city;
pub mod hotel;
pub mod restaurant;
pub mod transport;
pub mod trip;
pub mod user;
pub mod wizard;
