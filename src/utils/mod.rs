pub mod accumulator;
pub mod data;
pub mod ev_analysis;
pub mod ev_calculator;
pub mod fixture_linker;
pub mod merger;
pub mod odds_extractor;
pub mod team_aliases;
pub mod team_names;
