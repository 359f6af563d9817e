/// Build a [`Data`](crate::Data) fragment inline.
///
/// ```
/// use coderr::{data, Value};
///
/// let d = data! { "path" => "/etc/app.toml", "retries" => 3 };
/// assert_eq!(d.get("retries"), Some(&Value::Int(3)));
/// ```
#[macro_export]
macro_rules! data {
    () => {
        $crate::Data::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut data = $crate::Data::new();
        $( data.insert($key, $value); )+
        data
    }};
}

/// Early-return an [`Error`](crate::Error) if a condition is false.
///
/// Expands in place, so the enclosing function is the error's frame 0.
///
/// ```ignore
/// ensure!(port != 0, "net/bad_port");
/// ensure!(port != 0, "net/bad_port", { "port" => port });
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $code:expr $(,)?) => {
        if !$cond {
            return ::core::result::Result::Err($crate::Error::new($code, []));
        }
    };
    ($cond:expr, $code:expr, { $($key:expr => $value:expr),* $(,)? }) => {
        if !$cond {
            return ::core::result::Result::Err($crate::Error::new(
                $code,
                [$crate::data! { $($key => $value),* }],
            ));
        }
    };
}

/// Unconditionally return an [`Error`](crate::Error).
///
/// ```ignore
/// bail!("auth/denied");
/// bail!("auth/denied", { "user" => name });
/// ```
#[macro_export]
macro_rules! bail {
    ($code:expr $(,)?) => {
        return ::core::result::Result::Err($crate::Error::new($code, []))
    };
    ($code:expr, { $($key:expr => $value:expr),* $(,)? }) => {
        return ::core::result::Result::Err($crate::Error::new(
            $code,
            [$crate::data! { $($key => $value),* }],
        ))
    };
}

#[cfg(test)]
mod tests {
    use crate::{Error, Value};

    #[test]
    fn data_empty() {
        let d = data! {};
        assert!(d.is_empty());
    }

    #[test]
    fn data_mixed_values() {
        let d = data! {
            "name" => "eth0",
            "mtu" => 1500u32,
            "up" => true,
            "peers" => vec!["a", "b"],
        };
        assert_eq!(d.len(), 4);
        assert_eq!(d.get("mtu"), Some(&Value::Uint(1500)));
        assert_eq!(d.get("up"), Some(&Value::Bool(true)));
        assert_eq!(
            d.get("peers"),
            Some(&Value::List(vec![Value::from("a"), Value::from("b")]))
        );
    }

    #[test]
    fn data_duplicate_key_last_wins() {
        let d = data! { "k" => 1, "k" => 2 };
        assert_eq!(d.get("k"), Some(&Value::Int(2)));
    }

    fn check(val: i32) -> Result<i32, Error> {
        ensure!(val > 0, "value/negative");
        Ok(val)
    }

    fn check_with_data(val: i32) -> Result<i32, Error> {
        ensure!(val > 0, "value/negative", { "val" => val });
        Ok(val)
    }

    #[test]
    fn ensure_passes() {
        assert_eq!(check(5).ok(), Some(5));
        assert_eq!(check_with_data(5).ok(), Some(5));
    }

    #[test]
    fn ensure_fails() {
        let e = check(-1).unwrap_err();
        assert_eq!(e.code(), &"value/negative");
        assert!(e.data().is_empty());

        let e = check_with_data(-1).unwrap_err();
        assert_eq!(e.data().get("val"), Some(&Value::Int(-1)));
    }

    #[test]
    fn ensure_origin_is_enclosing_fn() {
        let e = check(-1).unwrap_err();
        let frames = e.frames();
        assert!(!frames.is_empty());
        assert!(frames[0].function().ends_with("::check"), "{}", frames[0]);
    }

    #[test]
    fn bail_returns_error() {
        fn denied(user: &str) -> Result<(), Error> {
            bail!("auth/denied", { "user" => user });
        }
        let e = denied("mallory").unwrap_err();
        assert_eq!(e.code(), &"auth/denied");
        assert_eq!(e.data().get("user").and_then(Value::as_str), Some("mallory"));
        assert_eq!(e.to_string(), r#"auth/denied, data: {"user": "mallory"}"#);
    }

    #[test]
    fn bail_code_only() {
        fn always() -> Result<(), Error<u32>> {
            bail!(7u32);
        }
        assert_eq!(always().unwrap_err().code(), &7u32);
    }
}
