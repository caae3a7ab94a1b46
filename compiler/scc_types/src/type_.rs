// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use std::fmt;

use itertools::Itertools;

use crate::WORD_SIZE;

/// Declared type of a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Ty {
    Void,
    Int,
    Pointer(Box<Ty>),
    Array {
        elem: Box<Ty>,
        len: usize,
    },
    Function {
        ret: Box<Ty>,
        params: Vec<Ty>,
    },
}

impl Ty {
    pub fn pointer_to(ty: Ty) -> Self {
        Ty::Pointer(Box::new(ty))
    }

    pub fn array_of(elem: Ty, len: usize) -> Self {
        Ty::Array { elem: Box::new(elem), len }
    }

    pub fn function(ret: Ty, params: Vec<Ty>) -> Self {
        Ty::Function { ret: Box::new(ret), params }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Ty::Array { .. })
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, Ty::Pointer(_))
    }

    /// Number of bytes a declaration of this type occupies in a frame or
    /// in the data section, or `None` when that overflows `usize`.
    pub fn storage_size(&self) -> Option<usize> {
        match self {
            Ty::Array { len, .. } => WORD_SIZE.checked_mul(*len),
            _ => Some(WORD_SIZE),
        }
    }

    pub fn param_types(&self) -> Option<&[Ty]> {
        match self {
            Ty::Function { params, .. } => Some(params),
            _ => None,
        }
    }

    pub fn return_type(&self) -> Option<&Ty> {
        match self {
            Ty::Function { ret, .. } => Some(ret),
            _ => None,
        }
    }

    /// Reinterprets a declared type as the value it yields when used as an
    /// expression operand.
    ///
    /// `int[n]` and `int*` both decay to [`ValueTy::IntPtr`]; `int*[n]` and
    /// `int**` decay to [`ValueTy::IntPtrPtr`]. Anything deeper, and function
    /// types, have no value form.
    pub fn decay(&self) -> Option<ValueTy> {
        match self {
            Ty::Void => Some(ValueTy::Void),
            Ty::Int => Some(ValueTy::Int),
            Ty::Pointer(inner) | Ty::Array { elem: inner, .. } => match inner.decay()? {
                ValueTy::Int => Some(ValueTy::IntPtr),
                ValueTy::IntPtr => Some(ValueTy::IntPtrPtr),
                _ => None,
            },
            Ty::Function { .. } => None,
        }
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Void => f.write_str("void"),
            Ty::Int => f.write_str("int"),
            Ty::Pointer(inner) => write!(f, "{inner}*"),
            Ty::Array { elem, len } => write!(f, "{elem}[{len}]"),
            Ty::Function { ret, params } => {
                write!(f, "{ret}({})", params.iter().join(", "))
            }
        }
    }
}

/// Value categories computed by the type checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueTy {
    Void,
    Int,

    /// pointer-to-int
    IntPtr,

    /// pointer-to-pointer-to-int
    IntPtrPtr,
}

impl ValueTy {
    pub fn is_pointer(self) -> bool {
        matches!(self, ValueTy::IntPtr | ValueTy::IntPtrPtr)
    }

    pub fn is_void(self) -> bool {
        self == ValueTy::Void
    }

    /// Result of dereferencing a value of this category.
    pub fn deref(self) -> Option<ValueTy> {
        match self {
            ValueTy::IntPtr => Some(ValueTy::Int),
            ValueTy::IntPtrPtr => Some(ValueTy::IntPtr),
            _ => None,
        }
    }
}

impl fmt::Display for ValueTy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueTy::Void => "void",
            ValueTy::Int => "int",
            ValueTy::IntPtr => "int*",
            ValueTy::IntPtrPtr => "int**",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Ty::Int, Some(ValueTy::Int))]
    #[case(Ty::Void, Some(ValueTy::Void))]
    #[case(Ty::pointer_to(Ty::Int), Some(ValueTy::IntPtr))]
    #[case(Ty::array_of(Ty::Int, 8), Some(ValueTy::IntPtr))]
    #[case(Ty::array_of(Ty::pointer_to(Ty::Int), 8), Some(ValueTy::IntPtrPtr))]
    #[case(Ty::pointer_to(Ty::pointer_to(Ty::Int)), Some(ValueTy::IntPtrPtr))]
    #[case(Ty::pointer_to(Ty::pointer_to(Ty::pointer_to(Ty::Int))), None)]
    #[case(Ty::function(Ty::Int, vec![]), None)]
    fn test_decay(#[case] ty: Ty, #[case] expected: Option<ValueTy>) {
        assert_eq!(ty.decay(), expected);
    }

    #[test]
    fn test_storage_size() {
        assert_eq!(Ty::Int.storage_size(), Some(4));
        assert_eq!(Ty::pointer_to(Ty::Int).storage_size(), Some(4));
        assert_eq!(Ty::array_of(Ty::Int, 10).storage_size(), Some(40));
        assert_eq!(Ty::array_of(Ty::Int, usize::MAX).storage_size(), None);
    }

    #[test]
    fn test_deref_peels_one_level() {
        assert_eq!(ValueTy::IntPtrPtr.deref(), Some(ValueTy::IntPtr));
        assert_eq!(ValueTy::IntPtr.deref(), Some(ValueTy::Int));
        assert_eq!(ValueTy::Int.deref(), None);
    }

    #[test]
    fn test_function_type_display() {
        let ty = Ty::function(Ty::pointer_to(Ty::Int), vec![Ty::Int, Ty::pointer_to(Ty::Int)]);
        assert_eq!(ty.to_string(), "int*(int, int*)");
    }
}
