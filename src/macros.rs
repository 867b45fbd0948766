macro_rules! str {
    ($s:expr) => {
        $s.to_string()
    };
}

macro_rules! unless {
    ($ex:expr, else $else_block:expr) => {
        match $ex {
            Some(x) => x,
            _ => $else_block,
        }
    };
    ($ex:expr) => {
        match $ex {
            Some(x) => x,
            _ => return,
        }
    };
}

/// Tests the current token's kind against a pattern without consuming it.
macro_rules! peek {
    ($p:expr, $kind:pat) => {
        matches!($p.peek_kind(), $kind)
    };
}

/// Consumes the current token when it has the given kind.
macro_rules! expect_if {
    ($p:expr, $kind:expr) => {
        $p.expect_kind($kind)
    };
}
