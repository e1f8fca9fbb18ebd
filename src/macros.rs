#[macro_export]
macro_rules! wrapper {
    // Single expression (like a function name or closure)
    ($f:expr) => {{
        $f()
    }};
    ($f:expr, $( $args:expr $(,)? )* ) => {{
        $f( $($args,)* )
    }};
}

/// Calls the wrapped function until it succeeds, waiting 5, 10 and 20 seconds between attempts
#[macro_export]
macro_rules! retry {
    ($( $args:expr$(,)? )+) => {{
        let mut wait: u64 = 5;
        loop {
            let res = $crate::wrapper!($( $args, )*);
            if res.is_ok() {
                break res;
            }
            if wait <= 20 {
                log::warn!("call failed, retrying in {} seconds", wait);
                std::thread::sleep(std::time::Duration::from_secs(wait));
                wait *= 2;
                continue;
            }
            break res;
        }
    }};
}
