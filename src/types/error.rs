// Copyright 2023 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

/// Errors raised while constructing or parsing protocol types.
#[allow(missing_docs)]
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid hex representation: {0}")]
    InvalidHex(#[from] prefix_hex::Error),
    #[error("invalid parent count: {0}")]
    InvalidParentCount(usize),
    #[error("parents are not unique and in ascending order")]
    ParentsNotUniqueSorted,
}
