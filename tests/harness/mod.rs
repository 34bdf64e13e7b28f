#![allow(dead_code)]

pub mod scripted_predictor;
pub mod temp_pantry;
