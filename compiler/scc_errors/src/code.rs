// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrCode {
    /// Symbol not found
    SEM2000     = 2000,

    /// Symbol already defined
    SEM2001     = 2001,

    /// Variable used as a function or the other way around
    SEM2002     = 2002,

    /// Prototype and definition disagree on the function's type
    SEM2003     = 2003,

    /// Local variable shadows a parameter (warning)
    SEM2004     = 2004,

    /// Name is reserved for a compiler-generated label
    SEM2005     = 2005,

    /// Invalid assignment target
    OBJ3000     = 3000,

    /// Invalid address-of operand
    OBJ3001     = 3001,

    /// Operand types are not compatible
    TYP4000     = 4000,

    /// Assignment type mismatch
    TYP4001     = 4001,

    /// Argument count does not match
    TYP4002     = 4002,

    /// Argument type does not match
    TYP4003     = 4003,

    /// Condition is not `int`
    TYP4004     = 4004,

    /// Return type mismatch
    TYP4005     = 4005,

    /// Dereference of a non-pointer
    TYP4006     = 4006,

    /// Address-of a non-`int` object
    TYP4007     = 4007,

    /// Declared type cannot be used as a value
    TYP4008     = 4008,

    /// Invalid variable or parameter type
    TYP4009     = 4009,

    /// Array does not fit the addressable range
    TYP4010     = 4010,

    /// Entry point is not defined
    STR5000     = 5000,

    /// Stack frame exceeds the addressable range
    STR5001     = 5001,

    /// Compiler invariant violated
    INT9000     = 9000,
}

impl fmt::Display for ErrCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
