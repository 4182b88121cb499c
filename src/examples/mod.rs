//! End-to-end scenarios exercising the whole pipeline together, as opposed
//! to the unit tests colocated with each module.

mod __tests__;
