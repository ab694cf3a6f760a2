pub mod aggregate;
pub mod config;
pub mod dates;
pub mod fetch;
pub mod incidents;
pub mod key;
pub mod output;
pub mod pipeline;
pub mod population;
pub mod rates;
