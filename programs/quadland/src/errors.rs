use anchor_lang::prelude::*;

#[error_code]
pub enum QuadlandError {
    #[msg("Quadkey has no valid terminator bit")]
    MalformedKey,

    #[msg("Zoom level out of range")]
    ZoomOutOfRange,

    #[msg("Tile zoom is deeper than the sale allows")]
    ZoomTooDeep,

    #[msg("Batch is empty")]
    EmptyBatch,

    #[msg("Group ids must be strictly increasing")]
    UnorderedGroup,

    #[msg("Invalid bit layout for packing")]
    InvalidBitLayout,

    #[msg("Invalid price curve")]
    InvalidPriceCurve,

    #[msg("Invalid sale configuration")]
    InvalidSaleConfig,

    #[msg("Tile lies outside the sale region")]
    OutsideRegion,

    #[msg("Metadata text is empty")]
    EmptyMetadata,

    #[msg("Reward token accounts are required for this protocol")]
    MissingRewardAccounts,

    #[msg("Reward token accounts do not match the protocol")]
    RewardAccountMismatch,

    #[msg("Unauthorized")]
    Unauthorized,

    #[msg("Tile is already owned")]
    TileAlreadyOwned,

    #[msg("Tile appears twice in the batch")]
    DuplicateKey,

    #[msg("Metadata protocol already registered")]
    ProtocolExists,

    #[msg("Tile has not been minted")]
    TileNotFound,

    #[msg("Tile is not owned by the given account")]
    NotTileOwner,

    #[msg("Owner index out of bounds")]
    IndexOutOfBounds,

    #[msg("Unknown metadata protocol")]
    UnknownProtocol,

    #[msg("Sale window is not open")]
    OutsideWindow,

    #[msg("No presale spots remaining")]
    PresaleFull,

    #[msg("Presale spot already reserved")]
    AlreadyReserved,

    #[msg("Caller holds no presale reservation")]
    NotReserved,

    #[msg("Purchase exceeds the remaining tile supply")]
    SupplyExhausted,

    #[msg("Payment is below the current price")]
    InsufficientPayment,

    #[msg("Sale has ended")]
    SaleEnded,

    #[msg("Arithmetic overflow")]
    Overflow,

    #[msg("A required tile account was not passed")]
    MissingTileAccount,

    #[msg("Tile account is not owned by this program")]
    InvalidAccountOwner,

    #[msg("Metadata text is too long")]
    MetadataTooLong,

    #[msg("Approved minter list is full")]
    TooManyMinters,
}

#[cfg(test)]
pub(crate) fn assert_error<T: std::fmt::Debug>(result: Result<T>, expected: QuadlandError) {
    let expected_code = expected as u32 + anchor_lang::error::ERROR_CODE_OFFSET;
    match result {
        Err(anchor_lang::error::Error::AnchorError(err)) => {
            assert_eq!(
                err.error_code_number, expected_code,
                "expected {}, got {}",
                expected_code, err.error_name
            );
        }
        other => panic!("expected error {}, got {:?}", expected_code, other),
    }
}
