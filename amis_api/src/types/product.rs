/// Numeric id of a commodity category on the market site (the `product`
/// query parameter).
pub type ProductId = u32;
