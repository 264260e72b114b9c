pub mod calc;
pub mod registry;
pub mod rewards;
pub mod state;
pub mod turn;

#[cfg(test)]
mod tests;
