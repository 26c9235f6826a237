mod calc;
mod fetcher;
