//! Running synchronous storage calls from async handlers.

use crate::error::{Result, ServiceError};

/// Run a blocking closure on the tokio blocking pool.
pub(crate) async fn blocking<F, T, E>(f: F) -> Result<T>
where
    F: FnOnce() -> std::result::Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Into<ServiceError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ServiceError::Internal(format!("spawn_blocking join error: {e}")))?
        .map_err(Into::into)
}

/// Body-generating macro for async-to-blocking delegation to `Storage`.
///
/// Each argument is annotated with a capture kind:
/// - `@ref arg`  `.clone()` a `&T`, pass as `&arg`
/// - `@copy arg` deref a `&T` where `T: Copy`, pass as `&arg`
/// - `@str arg`  `.to_owned()` a `&str`, pass as `&arg`
/// - `@val arg`  move directly (Copy/owned types)
macro_rules! delegate {
    ($self:ident, $method:ident $(, @$kind:ident $arg:ident)*) => {{
        let storage = $self.storage.clone();
        $(delegate!(@capture $kind $arg);)*
        $crate::blocking::blocking(move || storage.$method($(delegate!(@pass $kind $arg)),*)).await
    }};
    (@capture ref $arg:ident) => { let $arg = $arg.clone(); };
    (@capture copy $arg:ident) => { let $arg = *$arg; };
    (@capture str $arg:ident) => { let $arg = $arg.to_owned(); };
    (@capture val $arg:ident) => { };
    (@pass ref $arg:ident) => { &$arg };
    (@pass copy $arg:ident) => { &$arg };
    (@pass str $arg:ident) => { &$arg };
    (@pass val $arg:ident) => { $arg };
}

pub(crate) use delegate;
