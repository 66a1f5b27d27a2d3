//! Identity-based storage connection strings.

/// Connection string that binds a data source to a storage account by
/// resource id, so the search service authenticates with its managed identity.
pub fn storage_connection_string(
    subscription_id: &str,
    resource_group: &str,
    storage_account: &str,
) -> String {
    format!(
        "ResourceId=/subscriptions/{subscription_id}/resourceGroups/{resource_group}\
         /providers/Microsoft.Storage/storageAccounts/{storage_account};"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_string_shape() {
        assert_eq!(
            storage_connection_string("s1", "rg1", "acct1"),
            "ResourceId=/subscriptions/s1/resourceGroups/rg1/providers/Microsoft.Storage/storageAccounts/acct1;"
        );
    }
}
