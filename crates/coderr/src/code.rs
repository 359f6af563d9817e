/// Classification token attached to an [`Error`](crate::Error).
///
/// The library never interprets `C`; it only stores and compares it. Any
/// value type works: string constants, integers, enums, small structs.
///
/// `Unset` is the sentinel handed out when a caller builds an error without
/// a code, and the code reported for foreign errors by [`crate::code`].
/// It can never collide with a caller's own value because it lives outside
/// `C` entirely.
///
/// # Naming conventions
///
/// | Style            | Example                                  |
/// |------------------|------------------------------------------|
/// | `&'static str`   | `"config/missing"`, `"net/bind"`         |
/// | integer          | `404`, `0xE001`                          |
/// | enum             | `AppCode::Timeout`                       |
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Code<C> {
    /// No code was provided.
    #[default]
    Unset,
    /// A caller-supplied code.
    Set(C),
}

impl<C> Code<C> {
    /// The caller's value, or `None` for the sentinel.
    #[inline]
    pub fn get(&self) -> Option<&C> {
        match self {
            Code::Unset => None,
            Code::Set(c) => Some(c),
        }
    }

    #[inline]
    pub fn is_unset(&self) -> bool {
        matches!(self, Code::Unset)
    }

    #[inline]
    pub fn is_set(&self) -> bool {
        matches!(self, Code::Set(_))
    }

    /// Borrow the inner value without moving it.
    #[inline]
    pub fn as_ref(&self) -> Code<&C> {
        match self {
            Code::Unset => Code::Unset,
            Code::Set(c) => Code::Set(c),
        }
    }

    #[inline]
    pub fn into_inner(self) -> Option<C> {
        match self {
            Code::Unset => None,
            Code::Set(c) => Some(c),
        }
    }
}

impl<C> From<C> for Code<C> {
    #[inline]
    fn from(code: C) -> Self {
        Code::Set(code)
    }
}

impl<C: PartialEq> PartialEq<C> for Code<C> {
    #[inline]
    fn eq(&self, other: &C) -> bool {
        match self {
            Code::Unset => false,
            Code::Set(c) => c == other,
        }
    }
}

impl<C: core::fmt::Debug> core::fmt::Debug for Code<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Code::Unset => write!(f, "Unset"),
            Code::Set(c) => write!(f, "{:?}", c),
        }
    }
}

impl<C: core::fmt::Display> core::fmt::Display for Code<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Code::Unset => write!(f, "unset"),
            Code::Set(c) => write!(f, "{}", c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum AppCode {
        Timeout,
        Refused,
    }

    #[test]
    fn default_is_unset() {
        let code: Code<&str> = Code::default();
        assert!(code.is_unset());
        assert_eq!(code.get(), None);
    }

    #[test]
    fn from_value_is_set() {
        let code: Code<u32> = 404.into();
        assert!(code.is_set());
        assert_eq!(code.get(), Some(&404));
        assert_eq!(code.into_inner(), Some(404));
    }

    #[test]
    fn compares_against_raw_value() {
        assert_eq!(Code::Set("net/bind"), "net/bind");
        assert_ne!(Code::<&str>::Unset, "net/bind");
        assert_ne!(Code::Set(AppCode::Timeout), AppCode::Refused);
    }

    #[test]
    fn unset_differs_from_any_value() {
        // An empty string is still a real code.
        assert_ne!(Code::<&str>::Unset, Code::Set(""));
        assert_ne!(Code::<i32>::Unset, Code::Set(0));
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", Code::Set("msg/code")), "msg/code");
        assert_eq!(format!("{}", Code::<&str>::Unset), "unset");
    }

    #[test]
    fn debug_shows_inner() {
        assert_eq!(format!("{:?}", Code::Set(AppCode::Timeout)), "Timeout");
        assert_eq!(format!("{:?}", Code::<AppCode>::Unset), "Unset");
    }

    #[test]
    fn as_ref_keeps_variant() {
        let code = Code::Set(String::from("owned"));
        assert_eq!(code.as_ref(), Code::Set(&String::from("owned")));
        assert!(Code::<String>::Unset.as_ref().is_unset());
    }
}
