//! GraphQL operations for the Shopify Storefront API.
//!
//! Each operation is a unit struct implementing [`GraphQLQuery`] plus a
//! snake_case module holding its `Variables` and `ResponseData`, the same
//! layout `graphql_client`'s derive produces.

use graphql_client::{GraphQLQuery, QueryBody};
use serde::{Deserialize, Serialize};

use acme_core::{CartId, CartLineId, ProductId};

use crate::shopify::types::{
    CartUserError, Collection, Connection, Image, PriceRange, ProductVariant,
};

/// Implement [`GraphQLQuery`] for an operation struct.
macro_rules! storefront_operation {
    ($ty:ident, $module:ident, $name:literal, $document:expr) => {
        pub struct $ty;

        impl GraphQLQuery for $ty {
            type Variables = $module::Variables;
            type ResponseData = $module::ResponseData;

            fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
                QueryBody {
                    variables,
                    query: $document,
                    operation_name: $name,
                }
            }
        }
    };
}

// =============================================================================
// Fragments
// =============================================================================

macro_rules! cart_fields {
    () => {
        r"
fragment CartFields on Cart {
  id
  checkoutUrl
  totalQuantity
  cost {
    subtotalAmount { amount currencyCode }
    totalAmount { amount currencyCode }
    totalTaxAmount { amount currencyCode }
  }
  lines(first: 100) {
    edges {
      node {
        id
        quantity
        cost { totalAmount { amount currencyCode } }
        merchandise {
          ... on ProductVariant {
            id
            title
            selectedOptions { name value }
            price { amount currencyCode }
            product {
              id
              handle
              title
              images(first: 5) { edges { node { url altText width height } } }
            }
          }
        }
      }
    }
  }
}
"
    };
}

macro_rules! product_fields {
    () => {
        r"
fragment ProductFields on Product {
  id
  handle
  title
  description
  availableForSale
  priceRange {
    minVariantPrice { amount currencyCode }
    maxVariantPrice { amount currencyCode }
  }
  featuredImage { url altText width height }
  images(first: 10) { edges { node { url altText width height } } }
  options { id name optionValues { id name } }
  variants(first: 100) {
    edges {
      node {
        id
        title
        availableForSale
        price { amount currencyCode }
        selectedOptions { name value }
      }
    }
  }
}
"
    };
}

macro_rules! mutation_result_fields {
    () => {
        "cart { id } userErrors { code field message }"
    };
}

// =============================================================================
// Shared Nodes
// =============================================================================

/// Product node as returned inside product connections.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductNode {
    pub id: ProductId,
    #[serde(default)]
    pub handle: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub available_for_sale: bool,
    #[serde(default)]
    pub price_range: Option<PriceRange>,
    #[serde(default)]
    pub featured_image: Option<Image>,
    #[serde(default)]
    pub images: Option<Connection<Image>>,
    #[serde(default)]
    pub options: Vec<ProductOptionNode>,
    #[serde(default)]
    pub variants: Option<Connection<ProductVariant>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductOptionNode {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub option_values: Vec<ProductOptionValueNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductOptionValueNode {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Payload shared by the cart line mutations.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartMutationPayload {
    pub cart: Option<CartRef>,
    #[serde(default)]
    pub user_errors: Vec<CartUserError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CartRef {
    pub id: CartId,
}

// =============================================================================
// Cart Operations
// =============================================================================

storefront_operation!(
    CreateCart,
    create_cart,
    "CreateCart",
    concat!(
        "mutation CreateCart { cartCreate { cart { id checkoutUrl } ",
        "userErrors { code field message } } }"
    )
);

pub mod create_cart {
    use super::{CartUserError, Deserialize, Serialize};
    use crate::shopify::types::CreatedCart;

    #[derive(Debug, Clone, Default, Serialize)]
    pub struct Variables {}

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_create: Option<CartCreatePayload>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CartCreatePayload {
        pub cart: Option<CreatedCart>,
        #[serde(default)]
        pub user_errors: Vec<CartUserError>,
    }
}

storefront_operation!(
    AddCartLines,
    add_cart_lines,
    "AddCartLines",
    concat!(
        "mutation AddCartLines($cartId: ID!, $lines: [CartLineInput!]!) { ",
        "cartLinesAdd(cartId: $cartId, lines: $lines) { ",
        mutation_result_fields!(),
        " } }"
    )
);

pub mod add_cart_lines {
    use super::{CartId, CartMutationPayload, Deserialize, Serialize};
    use crate::shopify::types::CartLineInput;

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: CartId,
        pub lines: Vec<CartLineInput>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_lines_add: Option<CartMutationPayload>,
    }
}

storefront_operation!(
    UpdateCartLines,
    update_cart_lines,
    "UpdateCartLines",
    concat!(
        "mutation UpdateCartLines($cartId: ID!, $lines: [CartLineUpdateInput!]!) { ",
        "cartLinesUpdate(cartId: $cartId, lines: $lines) { ",
        mutation_result_fields!(),
        " } }"
    )
);

pub mod update_cart_lines {
    use super::{CartId, CartMutationPayload, Deserialize, Serialize};
    use crate::shopify::types::CartLineUpdateInput;

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: CartId,
        pub lines: Vec<CartLineUpdateInput>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_lines_update: Option<CartMutationPayload>,
    }
}

storefront_operation!(
    RemoveCartLines,
    remove_cart_lines,
    "RemoveCartLines",
    concat!(
        "mutation RemoveCartLines($cartId: ID!, $lineIds: [ID!]!) { ",
        "cartLinesRemove(cartId: $cartId, lineIds: $lineIds) { ",
        mutation_result_fields!(),
        " } }"
    )
);

pub mod remove_cart_lines {
    use super::{CartId, CartLineId, CartMutationPayload, Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: CartId,
        pub line_ids: Vec<CartLineId>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub cart_lines_remove: Option<CartMutationPayload>,
    }
}

storefront_operation!(
    GetCart,
    get_cart,
    "GetCart",
    concat!(
        "query GetCart($cartId: ID!) { cart(id: $cartId) { ...CartFields } }\n",
        cart_fields!()
    )
);

pub mod get_cart {
    use super::{CartId, Deserialize, Serialize};
    use crate::shopify::types::ShopifyCart;

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub cart_id: CartId,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub cart: Option<ShopifyCart>,
    }
}

// =============================================================================
// Catalog Operations
// =============================================================================

storefront_operation!(
    GetProducts,
    get_products,
    "GetProducts",
    concat!(
        "query GetProducts($first: Int!, $query: String) { ",
        "products(first: $first, query: $query) { edges { node { ...ProductFields } } } }\n",
        product_fields!()
    )
);

pub mod get_products {
    use super::{Connection, Deserialize, ProductNode, Serialize};

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub first: i64,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub query: Option<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub products: Connection<ProductNode>,
    }
}

storefront_operation!(
    GetCollectionProducts,
    get_collection_products,
    "GetCollectionProducts",
    concat!(
        "query GetCollectionProducts($handle: String!, $first: Int!) { ",
        "collection(handle: $handle) { products(first: $first) { edges { node { ...ProductFields } } } } }\n",
        product_fields!()
    )
);

pub mod get_collection_products {
    use super::{Connection, Deserialize, ProductNode, Serialize};

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub handle: String,
        pub first: i64,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub collection: Option<CollectionProducts>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct CollectionProducts {
        pub products: Connection<ProductNode>,
    }
}

storefront_operation!(
    GetCollections,
    get_collections,
    "GetCollections",
    concat!(
        "query GetCollections($first: Int!) { collections(first: $first) { edges { node { ",
        "id handle title description updatedAt seo { title description } } } } }"
    )
);

pub mod get_collections {
    use super::{Collection, Connection, Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub first: i64,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub collections: Connection<Collection>,
    }
}
