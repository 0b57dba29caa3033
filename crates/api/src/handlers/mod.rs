pub mod ai_example;
pub mod analytics;
pub mod animation;
pub mod case_study;
pub mod collage_preset;
pub mod composer;
pub mod customer;
pub mod generation;
pub mod image;
pub mod picker;
pub mod project;
pub mod public;
pub mod publish;
pub mod section_image;
pub mod team_member;
