use serde::{Deserialize, Serialize};

/// Account-control status bits (Active Directory `userAccountControl`).
///
/// Only the subset relevant to login decisions is modelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountControlFlag {
    AccountDisabled,
    Lockout,
    PasswdNotreqd,
    DontExpirePasswd,
    PasswordExpired,
}

impl AccountControlFlag {
    /// Flag table, in bit order.
    pub const ALL: [AccountControlFlag; 5] = [
        AccountControlFlag::AccountDisabled,
        AccountControlFlag::Lockout,
        AccountControlFlag::PasswdNotreqd,
        AccountControlFlag::DontExpirePasswd,
        AccountControlFlag::PasswordExpired,
    ];

    pub const fn bit(self) -> u64 {
        match self {
            AccountControlFlag::AccountDisabled => 2,
            AccountControlFlag::Lockout => 16,
            AccountControlFlag::PasswdNotreqd => 32,
            AccountControlFlag::DontExpirePasswd => 65_536,
            AccountControlFlag::PasswordExpired => 8_388_608,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AccountControlFlag::AccountDisabled => "ACCOUNT_DISABLED",
            AccountControlFlag::Lockout => "LOCKOUT",
            AccountControlFlag::PasswdNotreqd => "PASSWD_NOTREQD",
            AccountControlFlag::DontExpirePasswd => "DONT_EXPIRE_PASSWD",
            AccountControlFlag::PasswordExpired => "PASSWORD_EXPIRED",
        }
    }
}

impl core::fmt::Display for AccountControlFlag {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw account-control bitmask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountControl(u64);

impl AccountControl {
    pub const fn new(bits: u64) -> Self {
        Self(bits)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, flag: AccountControlFlag) -> bool {
        self.0 & flag.bit() == flag.bit()
    }

    /// Parse the directory's textual value.
    ///
    /// Anything that is not a non-negative integer yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        raw.parse::<u64>().ok().map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn normal_account_has_no_modelled_flags() {
        // 0x200 NORMAL_ACCOUNT
        let uac = AccountControl::new(512);
        assert!(!uac.is_empty());
        assert!(AccountControlFlag::ALL.into_iter().all(|f| !uac.contains(f)));
    }

    #[test]
    fn combined_bits_are_all_reported() {
        let uac = AccountControl::new(512 | 2 | 65_536);
        let set: Vec<_> = AccountControlFlag::ALL
            .into_iter()
            .filter(|f| uac.contains(*f))
            .collect();
        assert_eq!(
            set,
            vec![
                AccountControlFlag::AccountDisabled,
                AccountControlFlag::DontExpirePasswd
            ]
        );
    }

    #[test]
    fn parse_rejects_non_numeric_negative_and_padded() {
        assert_eq!(AccountControl::parse("66048"), Some(AccountControl::new(66_048)));
        assert_eq!(AccountControl::parse(" 514 "), None);
        assert_eq!(AccountControl::parse("enabled"), None);
        assert_eq!(AccountControl::parse("-2"), None);
        assert_eq!(AccountControl::parse(""), None);
    }

    proptest! {
        #[test]
        fn contains_matches_bitwise_and(bits in any::<u32>()) {
            let uac = AccountControl::new(bits as u64);
            for flag in AccountControlFlag::ALL {
                prop_assert_eq!(uac.contains(flag), (bits as u64) & flag.bit() != 0);
            }
        }
    }
}
