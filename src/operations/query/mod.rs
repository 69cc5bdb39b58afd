mod parameter_at_length;

pub use parameter_at_length::{Inversion, InversionParams, ParameterAtLength};
