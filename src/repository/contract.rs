use alloy::sol;

// Interfaces of the contracts deployed on Tea Sepolia
sol! {
    /// ERC-20 surface of ZNCT and the TeaToken template.
    interface IERC20 {
        function transfer(address to, uint256 amount) external returns (bool);

        function approve(address spender, uint256 amount) external returns (bool);

        function transferFrom(address from, address to, uint256 amount) external returns (bool);

        /// Balance in the token's smallest unit (18 decimals for ZNCT).
        function balanceOf(address account) external view returns (uint256);
    }

    /// ERC-721 surface of TeaNFT and the BasicNFT template.
    interface IERC721 {
        /// Mints the next token id to `to` and returns it.
        function safeMint(address to, string memory tokenURI) external returns (uint256);

        function tokenURI(uint256 tokenId) external view returns (string memory);
    }

    /// SimplePair: a single ZNCT/TEA liquidity pool.
    ///
    /// The pricing curve lives entirely in the deployed contract; callers only
    /// encode the call shapes below.
    interface ISimplePair {
        /// Deposits `tokenAmount` ZNCT (pre-approved) together with the attached TEA.
        function addLiquidity(uint256 tokenAmount) external payable;

        function removeLiquidity(uint256 tokenAmount, uint256 ethAmount) external;

        /// Sells `tokenAmount` ZNCT (pre-approved) for TEA.
        function swapTokensForETH(uint256 tokenAmount) external;

        /// TEA paid out for `tokenAmount` ZNCT.
        function getETHAmount(uint256 tokenAmount) external pure returns (uint256);
    }
}
