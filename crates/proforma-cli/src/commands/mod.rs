pub mod pro_forma;
pub mod solvers;
