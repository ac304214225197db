//! Integration tests for incremental VPK extraction

mod cli_commands;
mod extraction;
mod rescan;
mod test_utils;
