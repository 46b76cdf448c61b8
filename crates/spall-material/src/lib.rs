//! Constitutive models for the Spall solver.
//!
//! The hydrodynamic core closes the energy equation with an
//! [`EquationOfState`]; the implicit midpoint form is solved per cell
//! partition by [`NewtonRaphson`] over a [`VnrEnergyResidual`]. The
//! deviatoric part of the stress is driven by the rheology models
//! ([`ShearModulusModel`], [`YieldStressModel`]).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod eos;
pub mod newton;
pub mod rheology;
pub mod vnr;

pub use eos::{EosOutput, EquationOfState, MieGruneisen};
pub use newton::{NewtonRaphson, ResidualFunction};
pub use rheology::{
    update_deviatoric_stress, ConstantShearModulus, ConstantYieldStress, ShearModulusModel,
    YieldStressModel,
};
pub use vnr::{solve_partition_energy, EnergySolution, PartitionError, VnrEnergyResidual};
