use std::{fmt, io};
use std::panic::Location;
use std::error::Error as StdError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A failure together with the failures that led to it.
///
/// `Display` prints the outermost message first with its key/value context
/// beneath it, then each cause indented one level deeper than the error it
/// caused. With `RUST_BACKTRACE` set, each level also shows where it was
/// raised.
#[derive(Debug)]
pub struct Error {
    detail: Box<dyn ErrorDetail>,
    cause: Option<Box<Error>>,
    location: &'static Location<'static>,
}

pub trait ErrorDetail: fmt::Display + fmt::Debug + Send + Sync {
    fn context(&self) -> Vec<(Option<String>, String)> { vec![] }
}

impl Error {
    /// Makes `self` the innermost cause of `outer`.
    pub fn chain(self, mut outer: Error) -> Self {
        fn append(error: Error, behind: &mut Error) {
            match behind.cause.as_mut() {
                Some(cause) => append(error, cause),
                None => behind.cause = Some(Box::new(error)),
            }
        }

        append(self, &mut outer);
        outer
    }

    /// The outermost message, without context or causes.
    pub fn message(&self) -> String {
        self.detail.to_string()
    }

    /// This error, then each cause in turn.
    pub fn causes(&self) -> impl Iterator<Item = &Error> {
        std::iter::successors(Some(self), |e| e.cause.as_deref())
    }
}

impl ErrorDetail for &(dyn StdError + Send + Sync) {
    fn context(&self) -> Vec<(Option<String>, String)> {
        std::iter::successors(self.source(), |e: &&dyn StdError| (*e).source())
            .map(|e| (None, e.to_string()))
            .collect()
    }
}

macro_rules! impl_error_detail_with_std_error {
    ($T:ty) => {
        impl $crate::error::ErrorDetail for $T {
            fn context(&self) -> Vec<(Option<String>, String)> {
                let error: &(dyn std::error::Error + Send + Sync) = self;
                $crate::error::ErrorDetail::context(&error)
            }
        }
    }
}

impl_error_detail_with_std_error!(io::Error);
impl_error_detail_with_std_error!(toml::de::Error);
impl_error_detail_with_std_error!(serde_yaml_ng::Error);

impl ErrorDetail for &'static str { }

impl<T: ErrorDetail + 'static> From<T> for Error {
    #[track_caller]
    fn from(detail: T) -> Self {
        Error {
            detail: Box::new(detail),
            cause: None,
            location: Location::caller(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let backtrace = std::env::var_os("RUST_BACKTRACE").is_some();
        for (depth, error) in self.causes().enumerate() {
            let indent = "    ".repeat(depth);
            let newline = format!("\n{indent}");

            writeln!(f, "{indent}{}", error.detail.to_string().replace('\n', &newline))?;
            for (key, value) in error.detail.context() {
                let value = value.replace('\n', &newline);
                match key {
                    Some(key) => writeln!(f, "{indent}{key}: {value}")?,
                    None => writeln!(f, "{indent}{value}")?,
                }
            }

            if backtrace {
                writeln!(f, "{indent}[{}]", error.location)?;
            }
        }

        Ok(())
    }
}

/// The detail built by [`error!`]: a message and its context lines.
#[derive(Debug)]
pub struct Message {
    pub text: String,
    pub context: Vec<(Option<String>, String)>,
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.text.fmt(f)
    }
}

impl ErrorDetail for Message {
    fn context(&self) -> Vec<(Option<String>, String)> {
        self.context.clone()
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! err {
    ($($token:tt)*) => (Err($crate::error!($($token)*)));
}

/// Builds an [`Error`] from a message, then any number of `key => value`
/// pairs and bare values for context.
#[macro_export]
macro_rules! error {
    ($msg:expr, $($rest:tt)*) => (
        $crate::error::Error::from($crate::error::Message {
            text: $msg.to_string(),
            context: {
                #[allow(unused_mut)]
                let mut v: Vec<(Option<String>, String)> = Vec::new();
                $crate::error!(@param v $($rest)*);
                v
            },
        })
    );

    ($msg:expr) => ( $crate::error!($msg,) );

    (@param $v:ident $key:expr => $value:expr, $($rest:tt)*) => {
        $crate::error!(@param $v $key => $value);
        $crate::error!(@param $v $($rest)*);
    };

    (@param $v:ident $key:expr => $value:expr) => {
        $v.push((Some($key.to_string()), $value.to_string()));
    };

    (@param $v:ident $value:expr, $($rest:tt)*) => {
        $crate::error!(@param $v $value);
        $crate::error!(@param $v $($rest)*);
    };

    (@param $v:ident $value:expr) => {
        $v.push((None, $value.to_string()));
    };

    (@param $v:ident $(,)?) => { };
}

pub trait Chainable<T> {
    fn chain(self, other: impl Into<Error>) -> Result<T>;

    fn chain_with<F, E>(self, f: F) -> Result<T>
        where F: FnOnce() -> E, E: Into<Error>;
}

impl<T, E: Into<Error>> Chainable<T> for Result<T, E> {
    #[track_caller]
    fn chain(self, other: impl Into<Error>) -> Result<T> {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(e.into().chain(other.into())),
        }
    }

    fn chain_with<F, Err>(self, f: F) -> Result<T>
        where F: FnOnce() -> Err, Err: Into<Error>,
    {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(e.into().chain(f().into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chained_errors_render_nested() {
        let inner: Result<()> = Err(io::Error::new(io::ErrorKind::NotFound, "no such file").into());
        let error = inner.chain(error!("failed to read content file", "path" => "posts/a.md"))
            .unwrap_err();

        assert_eq!(error.message(), "failed to read content file");
        assert_eq!(error.causes().count(), 2);

        let rendered = error.to_string();
        let outer = rendered.find("failed to read content file").unwrap();
        let context = rendered.find("path: posts/a.md").unwrap();
        let cause = rendered.find("    no such file").unwrap();
        assert!(outer < context && context < cause, "{rendered}");
    }

    #[test]
    fn chain_appends_innermost() {
        let error = error!("root cause")
            .chain(error!("middle"))
            .chain(error!("outer"));

        let messages: Vec<_> = error.causes().map(Error::message).collect();
        assert_eq!(messages, ["outer", "middle", "root cause"]);
    }

    #[test]
    fn err_macro_collects_parameters() {
        let result: Result<()> = err!("bad thing", "key" => 1, "loose");
        let rendered = result.unwrap_err().to_string();
        assert!(rendered.starts_with("bad thing\n"));
        assert!(rendered.contains("key: 1\n"));
        assert!(rendered.contains("loose\n"));
    }
}
