//! ERC-20 bindings
//!
//! Used with [`crate::PrivyEvmWalletProvider::read_contract_call`] for reads
//! and with `abi_encode` to build calldata for
//! [`crate::EvmTransaction::with_data`].

use alloy::sol;

sol! {
    /// Standard ERC-20 interface
    interface IERC20 {
        function name() external view returns (string memory);

        function symbol() external view returns (string memory);

        function decimals() external view returns (uint8);

        function totalSupply() external view returns (uint256);

        /// Returns the balance of an account
        function balanceOf(address account) external view returns (uint256);

        /// Returns the allowance of a spender
        function allowance(address owner, address spender) external view returns (uint256);

        function approve(address spender, uint256 amount) external returns (bool);

        /// Transfers tokens to a recipient
        function transfer(address to, uint256 amount) external returns (bool);

        event Transfer(address indexed from, address indexed to, uint256 value);

        event Approval(address indexed owner, address indexed spender, uint256 value);
    }
}
