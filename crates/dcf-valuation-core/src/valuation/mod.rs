pub mod aggregator;
pub mod cost_of_capital;

pub use aggregator::{aggregate, AggregateInput, ForecastAssumptions, ForecastYear, ValuationResult};
pub use cost_of_capital::{
    cost_of_equity, weighted_average_cost_of_capital, CapitalWeights, CostOfEquityInput,
};
