pub mod rating;
pub mod resolver;
pub mod synthetic;

pub use rating::{DefaultSpreadTable, Rating, RatingSpreadTable};
pub use resolver::{
    resolve_cost_of_debt, CostOfDebt, CostOfDebtContext, CostOfDebtMethod, CostOfDebtSelection,
};
pub use synthetic::{synthetic_rating, FirmSize, SyntheticRating};
