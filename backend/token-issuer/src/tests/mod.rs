mod issuer;
