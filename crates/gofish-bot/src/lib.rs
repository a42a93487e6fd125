pub mod policy;

pub use policy::{
    BookBuilderPolicy, ExpectationPolicy, Policy, PolicyContext, PublicClaimPolicy,
};
